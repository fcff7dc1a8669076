//! Unit-level integration tests

mod fake;
mod test_fsm;
