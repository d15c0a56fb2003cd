//! HTTP request handlers, one module per resource.

pub mod attendance_handler;
pub mod audit_handler;
pub mod family_handler;
pub mod payment_handler;
pub mod pricing_handler;
pub mod report_handler;
pub mod staff_handler;
pub mod student_handler;
pub mod workshop_handler;

pub use attendance_handler::attendance_routes;
pub use audit_handler::audit_routes;
pub use family_handler::family_routes;
pub use payment_handler::payment_routes;
pub use pricing_handler::pricing_routes;
pub use report_handler::report_routes;
pub use staff_handler::staff_routes;
pub use student_handler::student_routes;
pub use workshop_handler::workshop_routes;
