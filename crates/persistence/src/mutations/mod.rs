// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write-side persistence operations.
//!
//! Mutation functions operate on a borrowed connection so the store can
//! compose them into a single transaction with the audit append.

pub mod audit;
pub mod facilities;
pub mod reports;
pub mod sessions;
pub mod users;
