// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fleet-core: shared domain types for the fleet crawl/job cluster.
//!
//! Holds the address/fleet-view data model (§3) and the counter container
//! (C4, §4.2). Worker lifecycle, RPC wiring, and the counter server/client
//! live in `fleet-daemon`; the wire transport lives in `fleet-wire`.

pub mod address;
pub mod clock;
pub mod counter;
pub mod error;
pub mod fleet_view;

pub use address::Address;
pub use clock::{Clock, FakeClock, Stopwatch, SystemClock};
pub use counter::{
    local_group, Aggregator, CounterContainer, CounterValue, IncrementAggregator, MergeAggregator,
    RawContainer, GLOBAL_GROUP,
};
pub use error::{CoreError, Result};
pub use fleet_view::FleetView;
