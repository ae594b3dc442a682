//! Status → rendering policy table
//!
//! One static [`StatusPolicy`] per [`SystemStatus`]. Map building looks the
//! policy up instead of branching on the status at every marker.

use crate::SystemStatus;
use serde::Serialize;

/// How a point is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerStyle {
    /// Font Awesome glyph on a coloured pin
    Icon {
        icon: &'static str,
        color: &'static str,
        icon_color: &'static str,
    },
    /// Filled circle, fixed pixel radius
    Circle {
        radius: u8,
        stroke: &'static str,
        fill: &'static str,
        fill_opacity: f32,
    },
}

/// Which end a link is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkDirection {
    HubToServer,
    ServerToHub,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinkStyle {
    pub color: &'static str,
    pub weight: u8,
    pub direction: LinkDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusPolicy {
    pub status: SystemStatus,
    pub hub: MarkerStyle,
    pub server: MarkerStyle,
    /// `None` means the cluster is drawn without links
    pub link: Option<LinkStyle>,
    /// Blink the markers (attacked targets)
    pub pulsing: bool,
}

/// Fill opacity the page's blink script keys on
pub const PULSE_FILL_OPACITY: f32 = 0.5;

pub const ONLINE: StatusPolicy = StatusPolicy {
    status: SystemStatus::Online,
    hub: MarkerStyle::Icon {
        icon: "fa-building",
        color: "blue",
        icon_color: "black",
    },
    server: MarkerStyle::Icon {
        icon: "fa-server",
        color: "lightgreen",
        icon_color: "black",
    },
    link: Some(LinkStyle {
        color: "lightgreen",
        weight: 3,
        direction: LinkDirection::HubToServer,
    }),
    pulsing: false,
};

pub const ISOLATED: StatusPolicy = StatusPolicy {
    status: SystemStatus::Isolated,
    hub: MarkerStyle::Icon {
        icon: "fa-building",
        color: "lightgray",
        icon_color: "white",
    },
    server: MarkerStyle::Icon {
        icon: "fa-server",
        color: "lightgray",
        icon_color: "white",
    },
    link: None,
    pulsing: false,
};

pub const OFFLINE: StatusPolicy = StatusPolicy {
    status: SystemStatus::Offline,
    hub: MarkerStyle::Circle {
        radius: 10,
        stroke: "black",
        fill: "red",
        fill_opacity: PULSE_FILL_OPACITY,
    },
    server: MarkerStyle::Circle {
        radius: 4,
        stroke: "black",
        fill: "red",
        fill_opacity: PULSE_FILL_OPACITY,
    },
    link: Some(LinkStyle {
        color: "red",
        weight: 2,
        direction: LinkDirection::ServerToHub,
    }),
    pulsing: true,
};

pub const ATTACK_SERVER_MARKER: MarkerStyle = MarkerStyle::Circle {
    radius: 10,
    stroke: "red",
    fill: "red",
    fill_opacity: 0.2,
};

pub const ATTACK_LINK: LinkStyle = LinkStyle {
    color: "red",
    weight: 2,
    direction: LinkDirection::ServerToHub,
};

pub fn policy_for(status: SystemStatus) -> &'static StatusPolicy {
    match status {
        SystemStatus::Online => &ONLINE,
        SystemStatus::Isolated => &ISOLATED,
        SystemStatus::Offline => &OFFLINE,
    }
}

impl MarkerStyle {
    pub fn is_pulsing(&self) -> bool {
        matches!(self, MarkerStyle::Circle { fill_opacity, .. } if *fill_opacity == PULSE_FILL_OPACITY)
    }
}
