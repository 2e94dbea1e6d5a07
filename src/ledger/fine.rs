// Library Desk - Library Management Core
// Copyright (C) 2025 Henning Berge
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Loan period and overdue fine arithmetic
//!
//! Fines are one unit per whole calendar day between the due date and the
//! return date. Both timestamps are truncated to their day before
//! subtracting, so the time of day never adds or removes a unit:
//! due on the 15th at 00:10, returned on the 17th at 23:50 is 2, not 3.

use chrono::{Duration, Local, NaiveDateTime, SubsecRound};

/// Fixed lending period
pub const LOAN_PERIOD_DAYS: i64 = 14;

/// Due date for a loan checked out at `checkout`
pub fn due_date_for(checkout: NaiveDateTime) -> NaiveDateTime {
    checkout + Duration::days(LOAN_PERIOD_DAYS)
}

/// Fine owed for a loan due at `due` and returned at `returned`
///
/// Zero unless `returned` is strictly after `due`; never negative.
pub fn compute_fine(due: NaiveDateTime, returned: NaiveDateTime) -> i64 {
    if returned <= due {
        return 0;
    }
    (returned.date() - due.date()).num_days()
}

/// Current local wall-clock time at whole-second precision
///
/// Stored timestamps never carry fractional seconds, which keeps their
/// text form comparable in SQL.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}
