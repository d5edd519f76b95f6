//! Unit tests for the agent orchestrator and its tools.

mod adapter_tests;
