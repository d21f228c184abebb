mod record;
mod value;

pub use record::{Record, Tuple, record_fields};
pub use value::{Map, Value};
