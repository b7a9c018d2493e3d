// Business logic services

pub mod member_service;
pub mod scheduling_service;
pub mod trainer_service;

pub use member_service::MemberService;
pub use scheduling_service::SchedulingService;
pub use trainer_service::TrainerService;
