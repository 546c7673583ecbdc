pub mod conflict;
pub mod error;
pub mod interval;
pub mod lock;
pub mod model;
pub mod resolve;
pub mod sprint;
pub mod window;

pub use crate::conflict::Conflict;
pub use crate::error::PlanError;
pub use crate::interval::{Interval, Minute};
pub use crate::lock::DayRecord;
pub use crate::model::{BlockStatus, DepthLevel, Origin, ScheduleItem};
pub use crate::resolve::{Outcome, Strategy};
pub use crate::sprint::{Sprint, SprintSet};
pub use crate::window::{EnforceMode, Window};
