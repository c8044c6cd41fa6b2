pub(crate) mod list;
pub(crate) mod migrate;

pub use list::list;
pub use migrate::migrate;
