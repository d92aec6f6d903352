pub mod action;
pub mod command;
pub mod credentials;
pub mod mode;
pub mod parameter;

#[rustfmt::skip]
pub use self::{
    action::Action,
    command::CommandOutput,
    credentials::Credentials,
    mode::Mode,
    parameter::{ParameterSet, ParameterValue},
};
