//! JSON net files.
//!
//! Layout: `points` (`x`, `y`, optional `term`, optional `wire_id`),
//! `segments` (`from`, `to`, `rect` as `[xmin, ymin, xmax, ymax]`, `via`),
//! `shorts` (`i0`, `i1`, `skip`). Missing optional fields default to empty.

use anyhow::{Context, Result};
use conngraph::api::{Net, NetPoint, Pt, Rect, Segment, Shape, Short};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetFile {
    pub points: Vec<PointRec>,
    #[serde(default)]
    pub segments: Vec<SegmentRec>,
    #[serde(default)]
    pub shorts: Vec<ShortRec>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointRec {
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wire_id: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentRec {
    pub from: usize,
    pub to: usize,
    pub rect: [i32; 4],
    #[serde(default)]
    pub via: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShortRec {
    pub i0: usize,
    pub i1: usize,
    #[serde(default)]
    pub skip: bool,
}

impl From<&Net> for NetFile {
    fn from(net: &Net) -> Self {
        Self {
            points: net
                .points
                .iter()
                .map(|p| PointRec {
                    x: p.pt.x,
                    y: p.pt.y,
                    term: p.term,
                    wire_id: p.wire_id,
                })
                .collect(),
            segments: net
                .segments
                .iter()
                .map(|s| {
                    let r = s.shape.rect;
                    SegmentRec {
                        from: s.from,
                        to: s.to,
                        rect: [r.xmin, r.ymin, r.xmax, r.ymax],
                        via: s.shape.via,
                    }
                })
                .collect(),
            shorts: net
                .shorts
                .iter()
                .map(|s| ShortRec {
                    i0: s.i0,
                    i1: s.i1,
                    skip: s.skip,
                })
                .collect(),
        }
    }
}

impl NetFile {
    pub fn into_net(self) -> Result<Net> {
        let points = self
            .points
            .into_iter()
            .map(|p| NetPoint {
                pt: Pt::new(p.x, p.y),
                term: p.term,
                wire_id: p.wire_id,
            })
            .collect();
        let segments = self
            .segments
            .into_iter()
            .map(|s| {
                let [x0, y0, x1, y1] = s.rect;
                Segment {
                    from: s.from,
                    to: s.to,
                    shape: Shape {
                        rect: Rect::new(x0, y0, x1, y1),
                        via: s.via,
                    },
                }
            })
            .collect();
        let shorts = self
            .shorts
            .into_iter()
            .map(|s| Short {
                i0: s.i0,
                i1: s.i1,
                skip: s.skip,
            })
            .collect();
        Ok(Net::new(points, segments, shorts)?)
    }
}

pub fn load_net<P: AsRef<Path>>(path: P) -> Result<Net> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let file: NetFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing net {}", path.display()))?;
    file.into_net()
        .with_context(|| format!("validating net {}", path.display()))
}

pub fn save_net<P: AsRef<Path>>(path: P, net: &Net) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let doc = serde_json::to_vec_pretty(&NetFile::from(net))?;
    fs::write(path, doc).with_context(|| format!("writing {}", path.display()))
}

pub fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating dir {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use conngraph::api::NetBuilder;
    use tempfile::tempdir;

    #[test]
    fn net_survives_a_trip_through_disk() {
        let mut b = NetBuilder::new();
        let a = b.term_point(0, 0, 0);
        let c = b.point(10, 0);
        let d = b.point(10, 0);
        b.wire(a, c, 2);
        b.via(c, d, 4);
        b.short(c, d);
        let mut net = b.build().unwrap();
        net.shorts[0].skip = true;
        net.points[1].wire_id = Some(3);

        let dir = tempdir().unwrap();
        let path = dir.path().join("nets/n.json");
        save_net(&path, &net).unwrap();
        let back = load_net(&path).unwrap();
        assert_eq!(back, net);
    }

    #[test]
    fn optional_fields_default() {
        let doc = r#"{"points": [{"x": 0, "y": 0}, {"x": 4, "y": 0}],
                      "shorts": [{"i0": 0, "i1": 1}]}"#;
        let file: NetFile = serde_json::from_str(doc).unwrap();
        let net = file.into_net().unwrap();
        assert!(net.segments.is_empty());
        assert!(!net.shorts[0].skip);
        assert_eq!(net.points[1].term, None);
    }

    #[test]
    fn bad_index_is_reported_with_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(
            &path,
            r#"{"points": [{"x": 0, "y": 0}], "shorts": [{"i0": 0, "i1": 5}]}"#,
        )
        .unwrap();
        let err = load_net(&path).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("validating net"));
        assert!(msg.contains("short 0 references missing point 5"));
    }

    #[test]
    fn oversized_terminal_is_rejected() {
        let doc = r#"{"points": [{"x": 0, "y": 0, "term": 18446744073709551615}]}"#;
        let file: NetFile = serde_json::from_str(doc).unwrap();
        let err = file.into_net().unwrap_err();
        assert!(format!("{err:#}").contains("terminal 18446744073709551615"));
    }
}
