mod client;
pub use client::{Client, Error, ErrorKind};

mod device;
pub use device::{Channel, DegreeType, Device, DriveLog, Temperature};

mod session;
pub use session::{ChartSeries, Session};

pub type Result<T> = std::result::Result<T, Error>;
