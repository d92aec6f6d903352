mod parameter_store;
mod remote_shell;
mod view;

#[rustfmt::skip]
pub use self::{
    parameter_store::ParameterStore,
    remote_shell::{RemoteSession, RemoteShell},
    view::View,
};
