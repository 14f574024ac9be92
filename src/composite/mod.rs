pub(crate) mod blend;
pub(crate) mod blur;
pub(crate) mod gradient;
pub(crate) mod stages;
