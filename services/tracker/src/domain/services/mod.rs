//! 领域服务

pub mod calorie_calculator;
