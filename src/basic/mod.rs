pub(crate) mod dsbus_dv;
pub(crate) mod newtonpf;

pub mod ecs;
pub mod solver;
pub(crate) mod sparse;
pub mod system;
pub use newtonpf::newton_pf;
