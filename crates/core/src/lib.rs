pub mod archive;
pub mod artifact;
pub mod cache;
pub mod chain;
pub mod error;
pub mod filter;
pub mod image;
pub mod logging;
pub mod native;
pub mod registry;
pub mod resolver;

pub use archive::{ArchiveHandle, ResourceLocation};
pub use artifact::{CodeUnit, output_name};
pub use cache::UnitCache;
pub use chain::{ResolverChain, UnitResolver};
pub use error::{ResolveError, Result};
pub use filter::LoadFilter;
pub use image::{UNIT_ENTRY, UnitDef, UnitImage};
pub use native::NativeSearchPath;
pub use registry::{Constructor, ConstructorRegistry};
pub use resolver::{Binding, SearchPathEntry, SearchPathResolver};
