//! Unit tests for the escalation engine.
