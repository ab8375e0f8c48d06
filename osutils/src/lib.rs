pub mod exe;
pub mod host;
pub mod packages;

pub(crate) mod crate_private {
    pub trait Sealed {}
}
