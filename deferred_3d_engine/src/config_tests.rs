//! Unit tests for config.rs

use crate::config::{EngineConfig, PoolLimits, ShaderStateChecking};
use crate::error::Error;

#[test]
fn test_default_config_is_valid() {
    let config = EngineConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.shader_state_checking, ShaderStateChecking::Enabled);
    assert!(config.render_target_pool.soft_limit_bytes <= config.render_target_pool.hard_limit_bytes);
}

#[test]
fn test_pool_limits_soft_equal_to_hard_is_valid() {
    assert!(PoolLimits::new(150, 150).validate().is_ok());
    assert!(PoolLimits::new(0, 150).validate().is_ok());
}

#[test]
fn test_pool_limits_soft_above_hard_rejected() {
    let result = PoolLimits::new(200, 150).validate();
    assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_pool_limits_zero_hard_rejected() {
    let result = PoolLimits::new(0, 0).validate();
    assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_stack_depth_too_small_rejected() {
    let config = EngineConfig {
        texture_unit_stack_depth: 1,
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(Error::InvalidConfiguration(_))));
}

#[test]
fn test_invalid_pool_limits_propagate() {
    let config = EngineConfig {
        render_target_pool: PoolLimits::new(10, 5),
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(Error::InvalidConfiguration(_))));
}
