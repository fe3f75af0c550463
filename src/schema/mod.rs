pub mod affinity;
pub mod biome;
pub mod effect;
pub mod error;
pub mod fragment;
pub mod modifier;
pub mod room_function;
pub mod template;
