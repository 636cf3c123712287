pub mod ball_rig;
pub mod bias;
pub mod grasp;
pub mod outcome;
pub mod score;
pub mod trajectory;
pub mod types;
pub mod velocity;
