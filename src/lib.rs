//! asg-target - Autoscaling target for cloud-managed instance groups
//!
//! Reconciles a desired instance count produced by an external scaling
//! strategy against a provider-managed instance group. Scale in drains
//! cluster nodes before their instances are terminated; scale out raises
//! desired capacity and waits for the group to converge.

pub mod cli;
pub mod config;
pub mod drain;
pub mod logging;
pub mod provider;
pub mod target;

pub use target::{AsgTarget, ScaleAction, ScaleOutcome, StatusVerdict, TargetError};
