pub mod service;

pub use crate::service::{
    BlockProposal, DayPlan, DaySnapshot, PlannerService, PlannerServiceBuilder, ServiceError,
};
