pub mod attendance;
pub mod expense;
pub mod payment;
pub mod role;
pub mod salary;
pub mod teacher;
