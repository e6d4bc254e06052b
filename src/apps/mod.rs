/// Apps installable with `k3sup app install`
pub mod openfaas_ingress;

pub use openfaas_ingress::OpenFaasIngressInstaller;
