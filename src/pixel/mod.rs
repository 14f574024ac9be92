pub(crate) mod pass;
