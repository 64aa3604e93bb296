// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management.
//!
//! The [`DeviceState`] struct owns the current state of the simulated device,
//! while [`StateChange`] represents the individual mutations the command
//! router applies to it.
//!
//! # Examples
//!
//! ```
//! use lumisim::state::{DeviceState, StateChange};
//! use lumisim::types::Mode;
//!
//! let mut state = DeviceState::new();
//! state.apply(&StateChange::Mode(Mode::Manual));
//! assert_eq!(state.mode(), Mode::Manual);
//! ```

mod device_state;
mod state_change;

pub use device_state::DeviceState;
pub use state_change::StateChange;
