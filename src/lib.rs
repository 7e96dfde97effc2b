pub mod cancel;
pub mod config;
pub mod error;
pub mod grid;
pub mod math;
pub mod mesh;
pub mod operations;
pub mod record;

pub use cancel::CancelToken;
pub use config::BakeParams;
pub use error::{InputError, NavoptError, Result};
pub use mesh::{IndexedMesh, NavTriangle, NavigationMesh};
pub use operations::{Bake, BakeInput, BakeOutcome, BakeReport};
