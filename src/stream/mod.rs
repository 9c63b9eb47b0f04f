//! Aggregation of task subscription streams

pub mod accumulator;

pub use accumulator::{
    AccumulatorState, StreamAccumulator, StreamOutcome, NO_EVENTS_RECEIVED, NO_TEXT_CONTENT,
};
