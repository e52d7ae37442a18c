pub mod stage0_load;
pub mod stage1_group;
pub mod stage2_draft;
pub mod stage3_publish;

pub use stage0_load::*;
pub use stage1_group::*;
pub use stage2_draft::*;
pub use stage3_publish::*;
