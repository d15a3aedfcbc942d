use bevy::prelude::*;

/// Terminal notification of a spin: the wheel has stopped, this is the prize.
#[derive(Message, Debug, Clone)]
pub struct SpinLanded {
    pub label: String,
}
