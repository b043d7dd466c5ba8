//! Pixel transforms: channel selection, displacement remapping and alpha compositing.

pub(crate) mod channel;
pub(crate) mod composite;
pub(crate) mod displace;
