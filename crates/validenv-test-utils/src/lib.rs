//! Test helpers shared across validenv crates.

pub mod dotenv;
pub mod schemas;

pub use dotenv::{DotenvDir, write_dotenv};
pub use schemas::{
    boat_schema, enum_schema, food_truck_schema, required_keys_schema, scalar_schema,
};
