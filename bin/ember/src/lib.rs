mod binding;
pub use binding::{Binding, Bindings};

mod bridge;
pub use bridge::{Bridge, Cloud, Event, Plugin};

mod config;
pub use config::{BindingConfig, Config, ConfigError};

mod error;
pub use error::Error;

mod host;
pub use host::MemoryHost;

mod reconciler;
pub use reconciler::{MappingError, Reconciler};

mod state;
pub use state::{Host, LocalId, StateUpdate, StateValue};

pub type Result<T> = std::result::Result<T, Error>;
