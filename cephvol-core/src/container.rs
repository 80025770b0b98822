//! Container execution context.
//!
//! Resolved once at the process boundary (CLI flag or `CEPH_CONTAINER_IMAGE`)
//! and handed to the builder explicitly.

pub const CONTAINER_IMAGE_ENV: &str = "CEPH_CONTAINER_IMAGE";
pub const CONTAINER_BINARY_ENV: &str = "CEPH_CONTAINER_BINARY";
pub const DEFAULT_CONTAINER_BINARY: &str = "docker";

/// Host paths ceph-volume needs inside the container.
pub const BIND_MOUNTS: [&str; 5] = [
    "/run/lock/lvm:/run/lock/lvm:z",
    "/dev:/dev",
    "/etc/ceph:/etc/ceph:z",
    "/run/lvm/lvmetad.socket:/run/lvm/lvmetad.socket",
    "/var/lib/ceph/:/var/lib/ceph/:z",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerContext {
    pub image: Option<String>,
    pub binary: String,
}

impl Default for ContainerContext {
    fn default() -> Self {
        Self::host()
    }
}

impl ContainerContext {
    /// Direct execution on the host.
    pub fn host() -> Self {
        Self {
            image: None,
            binary: DEFAULT_CONTAINER_BINARY.to_string(),
        }
    }

    pub fn new(image: Option<String>, binary: Option<String>) -> Self {
        Self {
            image: image.filter(|i| !i.is_empty()),
            binary: binary
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| DEFAULT_CONTAINER_BINARY.to_string()),
        }
    }

    pub fn image(image: impl Into<String>) -> Self {
        Self::new(Some(image.into()), None)
    }

    pub fn is_containerized(&self) -> bool {
        self.image.is_some()
    }

    /// The invocation prefix for `entrypoint`: the container run wrapper when an
    /// image is set, otherwise the bare binary.
    pub fn exec_prefix(&self, entrypoint: &str) -> Vec<String> {
        let Some(image) = &self.image else {
            return vec![entrypoint.to_string()];
        };

        let mut cmd: Vec<String> = [self.binary.as_str(), "run", "--rm", "--privileged", "--net=host"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        for mount in BIND_MOUNTS {
            cmd.push("-v".to_string());
            cmd.push(mount.to_string());
        }
        cmd.push(format!("--entrypoint={entrypoint}"));
        cmd.push(image.clone());
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_prefix_is_the_binary() {
        assert_eq!(
            ContainerContext::host().exec_prefix("ceph-volume"),
            vec!["ceph-volume"]
        );
    }

    #[test]
    fn container_prefix_wraps_with_bind_mounts() {
        let ctx = ContainerContext::image("quay.io/ceph/daemon:latest");
        let prefix = ctx.exec_prefix("ceph-volume");
        assert_eq!(
            prefix,
            vec![
                "docker",
                "run",
                "--rm",
                "--privileged",
                "--net=host",
                "-v",
                "/run/lock/lvm:/run/lock/lvm:z",
                "-v",
                "/dev:/dev",
                "-v",
                "/etc/ceph:/etc/ceph:z",
                "-v",
                "/run/lvm/lvmetad.socket:/run/lvm/lvmetad.socket",
                "-v",
                "/var/lib/ceph/:/var/lib/ceph/:z",
                "--entrypoint=ceph-volume",
                "quay.io/ceph/daemon:latest",
            ]
        );
    }

    #[test]
    fn empty_values_fall_back() {
        let ctx = ContainerContext::new(Some(String::new()), Some(String::new()));
        assert!(!ctx.is_containerized());
        assert_eq!(ctx.binary, "docker");

        let ctx = ContainerContext::new(Some("img".into()), Some("podman".into()));
        assert_eq!(ctx.exec_prefix("ceph-volume")[0], "podman");
    }
}
