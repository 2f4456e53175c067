#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! radmon - firmware core of a networked radiation monitor
//!
//! This library is the control loop of a sensor appliance that sits
//! between a serial Geiger counter and the network: it reassembles the
//! instrument's telemetry lines into timestamped readings, publishes
//! the latest one over a minimal HTTP interface, keeps its clock
//! aligned via SNTP, and persists operator settings across power
//! cycles.
//!
//! Everything is written against the traits in [`platform`], so the
//! same loop runs over the in-memory mocks (tests), the host
//! simulation platform (`sim` feature, TCP-bridged serial ports), or a
//! future MCU port.
//!
//! # Features
//!
//! - `std` (default): host builds; routes logging to the `log` facade
//! - `mock` (default): in-memory mock platform
//! - `sim`: host simulation platform and the `radmond` binary
//! - `defmt`: defmt logging for embedded ports (requires a transport)

// Platform abstraction layer
pub mod platform;

// Instrument drivers using platform abstraction
pub mod devices;

// Network protocols (HTTP interface, SNTP sync)
pub mod communication;

// Persisted configuration
pub mod config;

// Operator console
pub mod console;

// Control loop and shared infrastructure
pub mod core;
