/// Ingress and ClusterIssuer manifest rendering
use handlebars::Handlebars;
use serde::Serialize;

use crate::error::Result;

const TEMPLATE_NAME: &str = "openfaas-ingress";

const OPENFAAS_INGRESS_TEMPLATE: &str = r#"apiVersion: extensions/v1beta1
kind: Ingress
metadata:
  name: openfaas-gateway
  namespace: openfaas
  annotations:
    cert-manager.io/cluster-issuer: letsencrypt-prod
    kubernetes.io/ingress.class: nginx
spec:
  rules:
  - host: {{ingress_domain}}
    http:
      paths:
      - backend:
          serviceName: gateway
          servicePort: 8080
        path: /
  tls:
  - hosts:
    - {{ingress_domain}}
    secretName: openfaas-gateway
---
apiVersion: cert-manager.io/v1alpha2
kind: ClusterIssuer
metadata:
  name: letsencrypt-prod
spec:
  acme:
    email: {{certmanager_email}}
    server: https://acme-v02.api.letsencrypt.org/directory
    privateKeySecretRef:
      name: example-issuer-account-key
    solvers:
    - http01:
        ingress:
          class: nginx
"#;

#[derive(Serialize)]
struct TemplateData<'a> {
    ingress_domain: &'a str,
    certmanager_email: &'a str,
}

/// Rendered two-document YAML stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedManifest(Vec<u8>);

impl RenderedManifest {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Render the OpenFaaS ingress manifest for a domain and ACME email
///
/// Values are substituted verbatim; callers validate them beforehand.
pub fn render(domain: &str, email: &str) -> Result<RenderedManifest> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    // YAML output, not HTML
    registry.register_escape_fn(handlebars::no_escape);
    registry.register_template_string(TEMPLATE_NAME, OPENFAAS_INGRESS_TEMPLATE)?;

    let data = TemplateData {
        ingress_domain: domain,
        certmanager_email: email,
    };
    let rendered = registry.render(TEMPLATE_NAME, &data)?;

    Ok(RenderedManifest(rendered.into_bytes()))
}
