//! Release constants: version tag and precache manifest.
//!
//! The tag is the sole upgrade mechanism. Partition names embed it, so a
//! deploy with a new tag starts from fresh partitions and activation
//! sweeps the partitions of every previous tag. Changing the manifest
//! requires a redeploy with a bumped tag.

/// Deployed release tag.
pub const RELEASE_TAG: &str = "v1.0.0-dual";

/// Paths precached at install: the essentials for first paint.
pub const PRECACHE_PATHS: &[&str] = &[
    "/",
    "/index.html",
    "/manifest.webmanifest",
    // Posters and the home pill (PNG versions)
    "/assets/animations/hub_splash.png",
    "/assets/animations/hub_home_static.png",
    "/assets/animations/hub_pill_home.png",
    // One or two critical loops; the rest is fetched on demand
    "/assets/animations/hub_splash.mp4",
    "/assets/animations/hub_home_loop.mp4",
];

/// Document served to offline navigations from the precache partition.
pub const ROOT_DOCUMENT: &str = "/index.html";

/// Name of the precache partition for the current release.
pub fn precache_partition() -> String {
    format!("precache-{RELEASE_TAG}")
}

/// Name of the runtime partition for the current release.
pub fn runtime_partition() -> String {
    format!("runtime-{RELEASE_TAG}")
}
