pub mod corpus;
pub mod intent_classifier;
pub mod training_data;

pub use self::corpus::*;
pub use self::intent_classifier::*;
pub use self::training_data::*;
