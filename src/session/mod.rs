pub(crate) mod greeting;
pub(crate) mod sink;
