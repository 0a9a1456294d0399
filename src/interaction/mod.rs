
pub use hit_test::{
    AreaHandle, AreaShape, CircleArea, HitArea, HitResult, HitTestArena, LinesArea,
};
