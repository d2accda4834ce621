pub(crate) mod existence;
pub(crate) mod planner;
pub(crate) mod posters;
pub(crate) mod selector;
