//! Bond kinds and the course plans they generate
//!
//! Every bond is pure data: a list of courses, each holding the templates of
//! one horizontal repetition, plus a corner plan with one entry per corner
//! variant. Coordinates are course local with x along the wall and y across
//! it, centered on the wall axis.

use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bond::template::Template;
use crate::geometry::BrickModule;
use crate::io::error::{BondError, invalid_parameter};

/// Supported bond patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BondKind {
    /// Running bond of stretchers, half brick overlap, one brick thick
    #[serde(rename = "StretchedBond")]
    Stretched,
    /// Headers only, half header overlap
    #[serde(rename = "HeadBond")]
    Head,
    /// Header and stretcher courses, stretcher courses shifted every other time
    #[serde(rename = "CrossBond")]
    Cross,
    /// Headers and stretchers alternating within each course
    #[serde(rename = "GothicBond")]
    Gothic,
    /// Alternating header and stretcher courses
    #[serde(rename = "BlockBond")]
    Block,
}

impl BondKind {
    /// All bond kinds in declaration order
    pub const ALL: [Self; 5] = [
        Self::Stretched,
        Self::Head,
        Self::Cross,
        Self::Gothic,
        Self::Block,
    ];

    /// Name used in wall descriptions
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stretched => "StretchedBond",
            Self::Head => "HeadBond",
            Self::Cross => "CrossBond",
            Self::Gothic => "GothicBond",
            Self::Block => "BlockBond",
        }
    }

    /// Wall thickness the plan is laid out for
    pub const fn thickness(self, module: &BrickModule) -> f64 {
        match self {
            Self::Stretched => module.width(),
            Self::Head | Self::Cross | Self::Gothic | Self::Block => module.length(),
        }
    }

    /// Build the course plan
    pub fn plan(self, module: &BrickModule) -> Vec<Vec<Template>> {
        let l = module.length();
        let w = module.width();
        match self {
            Self::Stretched => vec![
                vec![Template::stretcher(l / 2.0, 0.0, l)],
                vec![Template::stretcher(l, 0.0, l)],
            ],
            Self::Head => vec![
                vec![Template::header(w / 2.0, 0.0, w)],
                vec![Template::header(w, 0.0, w)],
            ],
            Self::Block => vec![header_course(w, 0.0), stretcher_course(l, w, 0.0)],
            Self::Cross => vec![
                header_course(w, 0.0),
                stretcher_course(l, w, 0.0),
                header_course(w, 0.0),
                stretcher_course(l, w, l / 2.0),
            ],
            Self::Gothic => {
                let period = l + w;
                vec![
                    vec![
                        Template::stretcher(l / 2.0, -w / 2.0, period),
                        Template::stretcher(l / 2.0, w / 2.0, period),
                        Template::header(l + w / 2.0, 0.0, period),
                    ],
                    vec![
                        Template::header(l / 2.0, 0.0, period),
                        Template::stretcher(l + w / 2.0, -w / 2.0, period),
                        Template::stretcher(l + w / 2.0, w / 2.0, period),
                    ],
                ]
            }
        }
    }

    /// Build the corner plan
    ///
    /// Corner-local frame: origin at the intersection of the wall axes, x along
    /// the main leg, y along the secondary leg. Consecutive variants are laid in
    /// consecutive courses, so each variant ends both legs where the next
    /// course of the plan starts. Head and gothic bonds need queen closers for
    /// their half-width courses and cycle through four variants.
    pub fn corner_plan(self, module: &BrickModule) -> Vec<Vec<Template>> {
        let l = module.length();
        let w = module.width();
        let main_reach = vec![
            Template::fixed(-w / 2.0, 0.0, FRAC_PI_2),
            Template::fixed(w / 2.0, 0.0, FRAC_PI_2),
            Template::fixed(l / 2.0 + w / 2.0, 0.0, FRAC_PI_2),
        ];
        match self {
            Self::Stretched => vec![
                vec![Template::fixed(l / 2.0 - w / 2.0, 0.0, 0.0)],
                vec![Template::fixed(0.0, l / 2.0 - w / 2.0, FRAC_PI_2)],
            ],
            Self::Cross | Self::Block => vec![
                vec![
                    Template::fixed(0.0, -w / 2.0, 0.0),
                    Template::fixed(0.0, w / 2.0, 0.0),
                    Template::fixed(0.0, l / 2.0 + w / 2.0, 0.0),
                ],
                main_reach,
            ],
            Self::Head | Self::Gothic => vec![
                main_reach,
                vec![
                    Template::fixed(-w / 2.0, 0.0, FRAC_PI_2),
                    Template::fixed(w / 2.0, 0.0, FRAC_PI_2),
                    Template::fixed(l / 2.0 + w / 2.0, 0.0, FRAC_PI_2),
                    Template::closer(l / 2.0 + w + w / 4.0, 0.0, FRAC_PI_2),
                    Template::closer(0.0, l / 2.0 + w / 4.0, 0.0),
                ],
                vec![
                    Template::fixed(0.0, -w / 2.0, 0.0),
                    Template::fixed(0.0, w / 2.0, 0.0),
                    Template::fixed(0.0, l / 2.0 + w / 2.0, 0.0),
                    Template::fixed(0.0, l / 2.0 + 3.0 * w / 2.0, 0.0),
                ],
                vec![
                    Template::fixed(0.0, -w / 2.0, 0.0),
                    Template::fixed(0.0, w / 2.0, 0.0),
                    Template::fixed(l / 2.0 + w / 2.0, 0.0, FRAC_PI_2),
                    Template::closer(l / 2.0 + w + w / 4.0, 0.0, FRAC_PI_2),
                    Template::fixed(0.0, l / 2.0 + w / 2.0, 0.0),
                    Template::closer(0.0, l / 2.0 + w + w / 4.0, 0.0),
                ],
            ],
        }
    }
}

fn header_course(w: f64, shift: f64) -> Vec<Template> {
    vec![Template::header(w / 2.0 + shift, 0.0, w)]
}

fn stretcher_course(l: f64, w: f64, shift: f64) -> Vec<Template> {
    vec![
        Template::stretcher(l / 2.0 + shift, -w / 2.0, l),
        Template::stretcher(l / 2.0 + shift, w / 2.0, l),
    ]
}

impl fmt::Display for BondKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BondKind {
    type Err = BondError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| invalid_parameter("bond", &s, &"unknown bond type"))
    }
}
