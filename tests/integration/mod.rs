/// Integration tests for the reading tracker
mod basic_integration;
mod reorder_workflow;
