//! 터미널 출력 포맷팅 유틸리티
//!
//! 기동 과정에서 서비스 구성 단계를 시각적으로 표시합니다.
//! 로그 레벨과 무관하게 항상 출력되는 기동 배너 용도입니다.

use crate::core::registry::ServiceMetadata;

pub fn print_boxed_title(title: &str) {
    // 고정 너비 50칸 사용 (박스 내부 콘텐츠)
    let content_width = 50;
    let border = "═".repeat(content_width);

    println!("╔{}╗", border);
    println!("║{:^50}║", title);
    println!("╚{}╝", border);
}

pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

pub fn print_step_complete(step: u8, description: &str) {
    println!("✓ Step {}: {}", step, description);
}

pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// 구성 완료 요약
pub fn print_final_summary(store_backend: &str, metadata: &ServiceMetadata) {
    println!();
    print_boxed_title("🎉 SERVICE REGISTRY INITIALIZED");
    println!("   📦 User store: {}", store_backend);
    println!("   🔧 Service: {} v{} ({})", metadata.name, metadata.version, metadata.environment.as_str());
    println!();
}
