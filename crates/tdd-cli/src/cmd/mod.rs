pub mod bootstrap;
pub mod checklist;
pub mod mark;
pub mod orchestrate;
pub mod scaffold;
pub mod serve;
pub mod status;
