pub(crate) mod effects;
pub(crate) mod preset;
