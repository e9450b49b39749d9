mod alerts;
mod metrics;
mod record;
mod series;

pub use alerts::*;
pub use metrics::*;
pub use record::*;
pub use series::*;
