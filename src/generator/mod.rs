use crate::*;
pub use uniform::*;

mod uniform;

pub trait LayoutGenerator {
    fn generate(self, config: BoardConfig) -> MineLayout;
}
