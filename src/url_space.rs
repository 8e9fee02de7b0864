// url_space.rs - Candidate URL generation per storage provider
// Purpose: Turn a bucket/container name into every endpoint a provider might
//          route it under. Pure and deterministic: no I/O, no validation.
// Features:
//  - Baseline set: path-style, virtual-hosted, legacy and regional hostnames
//  - Advanced set: website hosting, acceleration, JSON/XML APIs, CDN edges

use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════
// REGION TABLES
// ═══════════════════════════════════════════════════════════════════════════

const AWS_REGIONS: &[&str] = &[
    "us-east-1",
    "us-west-2",
    "eu-west-1",
    "ap-southeast-1",
    "sa-east-1",
    "us-east-2",
    "eu-central-1",
];

/// Regions whose static website endpoint still uses the `s3-website-<region>` form
const AWS_DASH_WEBSITE_REGIONS: &[&str] = &[
    "us-east-1",
    "us-west-2",
    "eu-west-1",
    "ap-southeast-1",
    "sa-east-1",
];

const DIGITALOCEAN_REGIONS: &[&str] = &["nyc3", "ams3", "sgp1", "sfo3", "fra1", "blr1", "syd1"];

const LINODE_REGIONS: &[&str] = &["us-east-1", "eu-central-1", "ap-south-1", "us-southeast-1"];

const ORACLE_REGIONS: &[&str] = &["us-phoenix-1", "us-ashburn-1", "eu-frankfurt-1", "ap-tokyo-1"];

const IBM_REGIONS: &[&str] = &["us-south", "eu-gb", "ap-jp", "us-east"];

const BACKBLAZE_CLUSTERS: &[&str] = &["f000", "f001", "f002", "f003"];

const WASABI_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "eu-central-1",
    "ap-northeast-1",
];

const VULTR_REGIONS: &[&str] = &["ewr1", "sjc1", "ams1", "blr1", "del1", "sgp1"];

const SCALEWAY_REGIONS: &[&str] = &["fr-par", "nl-ams", "pl-waw"];

const OVH_REGIONS: &[&str] = &["gra", "sbg", "bhs", "de", "uk", "waw"];

const AZURE_WEB_ZONES: &[&str] = &["z1", "z13", "z22"];

// ═══════════════════════════════════════════════════════════════════════════
// TYPES
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Aws,
    Gcs,
    Azure,
    Firebase,
    DigitalOcean,
    Linode,
    Oracle,
    Ibm,
    Backblaze,
    Wasabi,
    Vultr,
    Scaleway,
    Ovh,
    SelfHosted,
}

impl Provider {
    /// Baseline generation order
    pub const ALL: [Provider; 14] = [
        Provider::Aws,
        Provider::Gcs,
        Provider::Azure,
        Provider::Firebase,
        Provider::DigitalOcean,
        Provider::Linode,
        Provider::Oracle,
        Provider::Ibm,
        Provider::Backblaze,
        Provider::Wasabi,
        Provider::Vultr,
        Provider::Scaleway,
        Provider::Ovh,
        Provider::SelfHosted,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Provider::Aws => "AWS S3",
            Provider::Gcs => "Google Cloud Storage",
            Provider::Azure => "Azure Blob",
            Provider::Firebase => "Firebase Storage",
            Provider::DigitalOcean => "DigitalOcean Spaces",
            Provider::Linode => "Linode Object Storage",
            Provider::Oracle => "Oracle Object Storage",
            Provider::Ibm => "IBM Cloud Object Storage",
            Provider::Backblaze => "Backblaze B2",
            Provider::Wasabi => "Wasabi",
            Provider::Vultr => "Vultr Object Storage",
            Provider::Scaleway => "Scaleway Object Storage",
            Provider::Ovh => "OVHcloud Object Storage",
            Provider::SelfHosted => "MinIO / self-hosted",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeMethod {
    #[default]
    Get,
    Head,
}

impl ProbeMethod {
    pub fn as_reqwest(&self) -> reqwest::Method {
        match self {
            ProbeMethod::Get => reqwest::Method::GET,
            ProbeMethod::Head => reqwest::Method::HEAD,
        }
    }
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeMethod::Get => f.write_str("GET"),
            ProbeMethod::Head => f.write_str("HEAD"),
        }
    }
}

/// One URL to probe, tagged with the provider whose pattern produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub url: String,
    pub method: ProbeMethod,
    pub provider: Provider,
}

impl ProbeTarget {
    pub fn new(provider: Provider, url: String) -> Self {
        Self {
            url,
            method: ProbeMethod::Get,
            provider,
        }
    }

    pub fn with_method(mut self, method: ProbeMethod) -> Self {
        self.method = method;
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BASELINE GENERATION
// ═══════════════════════════════════════════════════════════════════════════

/// Baseline URL set for every provider, concatenated in `Provider::ALL` order
pub fn generate(name: &str) -> Vec<ProbeTarget> {
    Provider::ALL
        .iter()
        .flat_map(|provider| {
            provider_urls(*provider, name)
                .into_iter()
                .map(move |url| ProbeTarget::new(*provider, url))
        })
        .collect()
}

/// Baseline URLs for a single provider
pub fn provider_urls(provider: Provider, bucket: &str) -> Vec<String> {
    match provider {
        Provider::Aws => aws_urls(bucket),
        Provider::Gcs => gcs_urls(bucket),
        Provider::Azure => azure_urls(bucket),
        Provider::Firebase => firebase_urls(bucket),
        Provider::DigitalOcean => digitalocean_urls(bucket),
        Provider::Linode => linode_urls(bucket),
        Provider::Oracle => oracle_urls(bucket),
        Provider::Ibm => ibm_urls(bucket),
        Provider::Backblaze => backblaze_urls(bucket),
        Provider::Wasabi => wasabi_urls(bucket),
        Provider::Vultr => vultr_urls(bucket),
        Provider::Scaleway => scaleway_urls(bucket),
        Provider::Ovh => ovh_urls(bucket),
        Provider::SelfHosted => self_hosted_urls(bucket),
    }
}

fn aws_urls(bucket: &str) -> Vec<String> {
    let mut urls = Vec::with_capacity(AWS_REGIONS.len() * 4 + 4);

    for region in AWS_REGIONS {
        // Path-style
        urls.push(format!("https://s3.{region}.amazonaws.com/{bucket}"));
        urls.push(format!("https://s3.{region}.amazonaws.com/{bucket}/"));
        // Virtual-hosted-style
        urls.push(format!("https://{bucket}.s3.{region}.amazonaws.com/"));
        urls.push(format!("https://{bucket}.s3.{region}.amazonaws.com"));

        // Legacy global endpoint resolves to us-east-1
        if *region == "us-east-1" {
            urls.push(format!("https://s3.amazonaws.com/{bucket}"));
            urls.push(format!("https://s3.amazonaws.com/{bucket}/"));
            urls.push(format!("https://{bucket}.s3.amazonaws.com/"));
            urls.push(format!("https://{bucket}.s3.amazonaws.com"));
        }
    }

    urls
}

fn gcs_urls(bucket: &str) -> Vec<String> {
    vec![
        format!("https://storage.googleapis.com/{bucket}"),
        format!("https://storage.googleapis.com/{bucket}/"),
        format!("https://{bucket}.storage.googleapis.com/"),
        format!("https://{bucket}.storage.googleapis.com"),
        format!("https://storage.cloud.google.com/{bucket}"),
        format!("https://storage.cloud.google.com/{bucket}/"),
        format!("https://console.cloud.google.com/storage/browser/{bucket}"),
        format!("https://www.googleapis.com/storage/v1/b/{bucket}/o"),
    ]
}

fn azure_urls(account: &str) -> Vec<String> {
    let mut urls = vec![
        format!("https://{account}.blob.core.windows.net/"),
        format!("https://{account}.blob.core.windows.net"),
        format!("https://{account}.blob.core.windows.net/?restype=container&comp=list"),
    ];
    for zone in AZURE_WEB_ZONES {
        urls.push(format!("https://{account}.{zone}.web.core.windows.net/"));
    }
    urls.push(format!("https://{account}.azurewebsites.net/"));
    urls
}

fn firebase_urls(project: &str) -> Vec<String> {
    vec![
        format!("https://firebasestorage.googleapis.com/v0/b/{project}/o"),
        format!("https://firebasestorage.googleapis.com/v0/b/{project}.appspot.com/o"),
        format!("https://{project}.web.app/"),
        format!("https://{project}.firebaseapp.com/"),
        format!("https://{project}.firebaseio.com/"),
    ]
}

fn digitalocean_urls(bucket: &str) -> Vec<String> {
    DIGITALOCEAN_REGIONS
        .iter()
        .flat_map(|region| {
            [
                format!("https://{bucket}.{region}.digitaloceanspaces.com/"),
                format!("https://{bucket}.{region}.digitaloceanspaces.com"),
                format!("https://{bucket}.{region}.cdn.digitaloceanspaces.com/"),
                format!("https://{bucket}.{region}.cdn.digitaloceanspaces.com"),
            ]
        })
        .collect()
}

fn linode_urls(bucket: &str) -> Vec<String> {
    LINODE_REGIONS
        .iter()
        .flat_map(|region| {
            [
                format!("https://{bucket}.{region}.linodeobjects.com/"),
                format!("https://{bucket}.{region}.linodeobjects.com"),
            ]
        })
        .collect()
}

fn oracle_urls(bucket: &str) -> Vec<String> {
    // The tenancy namespace is unknown, so the native API form uses a placeholder.
    ORACLE_REGIONS
        .iter()
        .flat_map(|region| {
            [
                format!("https://objectstorage.{region}.oraclecloud.com/n/namespace/b/{bucket}/o"),
                format!("https://{bucket}.compat.objectstorage.{region}.oraclecloud.com/"),
            ]
        })
        .collect()
}

fn ibm_urls(bucket: &str) -> Vec<String> {
    IBM_REGIONS
        .iter()
        .flat_map(|region| {
            [
                format!("https://s3.{region}.cloud-object-storage.appdomain.cloud/{bucket}"),
                format!("https://{bucket}.s3.{region}.cloud-object-storage.appdomain.cloud/"),
            ]
        })
        .collect()
}

fn backblaze_urls(bucket: &str) -> Vec<String> {
    BACKBLAZE_CLUSTERS
        .iter()
        .map(|cluster| format!("https://{cluster}.backblazeb2.com/file/{bucket}"))
        .collect()
}

fn wasabi_urls(bucket: &str) -> Vec<String> {
    let mut urls = vec![
        format!("https://s3.wasabisys.com/{bucket}"),
        format!("https://{bucket}.s3.wasabisys.com/"),
    ];
    for region in WASABI_REGIONS {
        urls.push(format!("https://s3.{region}.wasabisys.com/{bucket}"));
        urls.push(format!("https://{bucket}.s3.{region}.wasabisys.com/"));
    }
    urls
}

fn vultr_urls(bucket: &str) -> Vec<String> {
    VULTR_REGIONS
        .iter()
        .flat_map(|region| {
            [
                format!("https://{region}.vultrobjects.com/{bucket}"),
                format!("https://{bucket}.{region}.vultrobjects.com/"),
            ]
        })
        .collect()
}

fn scaleway_urls(bucket: &str) -> Vec<String> {
    SCALEWAY_REGIONS
        .iter()
        .flat_map(|region| {
            [
                format!("https://s3.{region}.scw.cloud/{bucket}"),
                format!("https://{bucket}.s3.{region}.scw.cloud/"),
            ]
        })
        .collect()
}

fn ovh_urls(bucket: &str) -> Vec<String> {
    OVH_REGIONS
        .iter()
        .flat_map(|region| {
            [
                format!("https://s3.{region}.io.cloud.ovh.net/{bucket}"),
                format!("https://{bucket}.s3.{region}.io.cloud.ovh.net/"),
            ]
        })
        .collect()
}

/// Guesses for MinIO and other S3-compatible servers run by the bucket owner
fn self_hosted_urls(bucket: &str) -> Vec<String> {
    vec![
        format!("https://play.min.io/{bucket}"),
        format!("https://minio.{bucket}.com/"),
        format!("https://s3.{bucket}.com/"),
        format!("https://storage.{bucket}.com/"),
        format!("https://{bucket}.com:9000/"),
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
// ADVANCED GENERATION
// ═══════════════════════════════════════════════════════════════════════════

/// Provider-specific alternate surfaces, kept apart from the baseline set
pub fn generate_advanced(name: &str) -> Vec<ProbeTarget> {
    let aws = aws_advanced_urls(name)
        .into_iter()
        .map(|url| ProbeTarget::new(Provider::Aws, url));
    let gcs = gcs_advanced_urls(name)
        .into_iter()
        .map(|url| ProbeTarget::new(Provider::Gcs, url));
    let azure = azure_advanced_urls(name)
        .into_iter()
        .map(|url| ProbeTarget::new(Provider::Azure, url));

    aws.chain(gcs).chain(azure).collect()
}

fn aws_advanced_urls(bucket: &str) -> Vec<String> {
    let mut urls = Vec::new();

    // Static website hosting is served over plain HTTP only
    for region in AWS_REGIONS {
        if AWS_DASH_WEBSITE_REGIONS.contains(region) {
            urls.push(format!("http://{bucket}.s3-website-{region}.amazonaws.com/"));
        }
        urls.push(format!("http://{bucket}.s3-website.{region}.amazonaws.com/"));
    }

    urls.push(format!("https://{bucket}.s3-accelerate.amazonaws.com/"));
    urls.push(format!("https://{bucket}.s3-accelerate.dualstack.amazonaws.com/"));

    for region in AWS_REGIONS {
        urls.push(format!("https://{bucket}.s3.dualstack.{region}.amazonaws.com/"));
    }

    urls.push(format!("https://{bucket}.s3.amazonaws.com/?list-type=2"));
    urls.push(format!("https://s3.amazonaws.com/{bucket}/?list-type=2"));

    urls
}

fn gcs_advanced_urls(bucket: &str) -> Vec<String> {
    vec![
        // JSON API
        format!("https://www.googleapis.com/storage/v1/b/{bucket}"),
        format!("https://storage.googleapis.com/storage/v1/b/{bucket}"),
        format!("https://storage.googleapis.com/storage/v1/b/{bucket}/o"),
        format!(
            "https://www.googleapis.com/storage/v1/b/{bucket}/iam/testPermissions?permissions=storage.objects.list"
        ),
        // XML API
        format!("https://{bucket}.storage.googleapis.com/?list-type=2"),
        format!("https://storage.googleapis.com/{bucket}?acl"),
    ]
}

fn azure_advanced_urls(account: &str) -> Vec<String> {
    vec![
        // Blob service REST surface
        format!("https://{account}.blob.core.windows.net/?comp=list"),
        format!("https://{account}.blob.core.windows.net/?restype=service&comp=properties"),
        format!("https://{account}.blob.core.windows.net/{account}?restype=container&comp=list"),
        format!("https://{account}.blob.core.windows.net/$root?restype=container&comp=list"),
        format!("https://{account}.blob.core.windows.net/$web?restype=container&comp=list"),
        // Sibling storage services on the same account
        format!("https://{account}.file.core.windows.net/?comp=list"),
        format!("https://{account}.queue.core.windows.net/?comp=list"),
        format!("https://{account}.table.core.windows.net/"),
        format!("https://{account}.dfs.core.windows.net/?resource=account"),
        // CDN edges
        format!("https://{account}.azureedge.net/"),
        format!("https://{account}.azurefd.net/"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_aws_contains_path_and_virtual_hosted_styles() {
        let urls = provider_urls(Provider::Aws, "examplebucket");
        assert!(urls.contains(&"https://s3.us-east-1.amazonaws.com/examplebucket".to_string()));
        assert!(urls.contains(&"https://examplebucket.s3.us-east-1.amazonaws.com/".to_string()));
        assert!(urls.contains(&"https://s3.amazonaws.com/examplebucket".to_string()));
        assert!(urls.contains(&"https://examplebucket.s3.amazonaws.com".to_string()));
        assert_eq!(urls.len(), AWS_REGIONS.len() * 4 + 4);
    }

    #[test]
    fn test_no_duplicates_within_a_provider() {
        for name in ["examplebucket", "assets", "my-company-backups", "a.b.c"] {
            for provider in Provider::ALL {
                let urls = provider_urls(provider, name);
                let unique: HashSet<_> = urls.iter().collect();
                assert_eq!(unique.len(), urls.len(), "{provider:?} duplicated a URL for {name}");
            }

            let advanced = generate_advanced(name);
            let unique: HashSet<_> = advanced.iter().map(|t| &t.url).collect();
            assert_eq!(unique.len(), advanced.len());
        }
    }

    #[test]
    fn test_generate_follows_provider_order() {
        let targets = generate("examplebucket");
        let mut seen = Vec::new();
        for target in &targets {
            if seen.last() != Some(&target.provider) {
                seen.push(target.provider);
            }
        }
        assert_eq!(seen, Provider::ALL.to_vec());
        assert!(targets.iter().all(|t| t.method == ProbeMethod::Get));
    }

    #[test]
    fn test_generate_is_deterministic() {
        assert_eq!(generate("examplebucket"), generate("examplebucket"));
        assert_eq!(generate_advanced("examplebucket"), generate_advanced("examplebucket"));
    }

    #[test]
    fn test_advanced_surfaces() {
        let urls: Vec<String> = generate_advanced("examplebucket")
            .into_iter()
            .map(|t| t.url)
            .collect();
        assert!(urls.contains(&"http://examplebucket.s3-website-us-east-1.amazonaws.com/".to_string()));
        assert!(urls.contains(&"https://examplebucket.s3-accelerate.amazonaws.com/".to_string()));
        assert!(urls.contains(&"https://www.googleapis.com/storage/v1/b/examplebucket".to_string()));
        assert!(urls.contains(&"https://examplebucket.azureedge.net/".to_string()));
    }

    #[test]
    fn test_name_is_passed_through_untouched() {
        let targets = generate("Not A Host!");
        assert!(targets.iter().all(|t| t.url.contains("Not A Host!")));
    }
}
