//! Control channel plumbing: a byte [`Transport`](transport::Transport)
//! plus the [`LineDecoder`](codec::LineDecoder) that turns its stream
//! into command lines.

pub mod codec;
pub mod transport;
