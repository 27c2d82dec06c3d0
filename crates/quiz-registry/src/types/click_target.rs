//! Click-target questions
//!
//! A visual asset plus rectangular target regions in pixel coordinates.

use crate::flat::{self, CellReader, Cells, FlattenError, FlattenOptions, UnflattenError};
use crate::{ContentRule, TypeEntry};
use quiz_core::{
    issue_if, AssetRef, ClickTargetContent, Content, Issue, QuestionType, Rule, RuleContext,
    TargetRegion,
};
use std::collections::BTreeSet;

const COL_ASSET: &str = "click_asset";
const COL_ALT: &str = "click_alt";
const COL_WIDTH: &str = "click_width";
const COL_HEIGHT: &str = "click_height";
const COL_REGIONS: &str = "click_regions";

pub fn entry() -> TypeEntry {
    TypeEntry {
        kind: QuestionType::ClickTarget,
        label: "Click target",
        rules: rules(),
        columns: &[COL_ASSET, COL_ALT, COL_WIDTH, COL_HEIGHT, COL_REGIONS],
        default_content: || Content::ClickTarget(ClickTargetContent::default()),
        decode: |value| serde_json::from_value(value).map(Content::ClickTarget),
        flatten,
        unflatten,
    }
}

pub fn rules() -> Vec<ContentRule> {
    vec![
        Rule::new("click_target.asset_required", asset_required)
            .with_description("The question references an asset"),
        Rule::new("click_target.regions_required", regions_required)
            .with_description("At least one target region"),
        Rule::new("click_target.region_ids_unique", region_ids_unique)
            .with_description("Region ids are present and unique"),
        Rule::new("click_target.region_size", region_size)
            .with_description("Regions have a positive width and height"),
        Rule::new("click_target.region_bounds", region_bounds)
            .with_description("Regions lie inside the asset when its size is known"),
    ]
}

fn asset_required(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(click) = content.as_click_target() else { return Vec::new() };
    issue_if(click.asset.url.trim().is_empty(), "content.asset.url", "Asset URL is empty")
}

fn regions_required(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(click) = content.as_click_target() else { return Vec::new() };
    issue_if(click.regions.is_empty(), "content.regions", "At least one target region is required")
}

fn region_ids_unique(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(click) = content.as_click_target() else { return Vec::new() };
    let mut seen = BTreeSet::new();
    let mut issues = Vec::new();
    for (i, region) in click.regions.iter().enumerate() {
        let field = format!("content.regions[{}].id", i);
        if region.id.trim().is_empty() {
            issues.push(Issue::new(field, "Region id is empty"));
        } else if !seen.insert(region.id.as_str()) {
            issues.push(Issue::new(field, format!("Region id '{}' is used more than once", region.id)));
        }
    }
    issues
}

fn region_size(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(click) = content.as_click_target() else { return Vec::new() };
    click
        .regions
        .iter()
        .enumerate()
        .filter(|(_, r)| r.width == 0 || r.height == 0)
        .map(|(i, r)| {
            Issue::new(
                format!("content.regions[{}]", i),
                format!("Region is {}x{}, both sides must be positive", r.width, r.height),
            )
        })
        .collect()
}

fn region_bounds(content: &Content, _ctx: &RuleContext<'_>) -> Vec<Issue> {
    let Some(click) = content.as_click_target() else { return Vec::new() };
    let (Some(width), Some(height)) = (click.asset.width, click.asset.height) else {
        return Vec::new();
    };
    click
        .regions
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            u64::from(r.x) + u64::from(r.width) > u64::from(width)
                || u64::from(r.y) + u64::from(r.height) > u64::from(height)
        })
        .map(|(i, _)| {
            Issue::new(
                format!("content.regions[{}]", i),
                format!("Region extends outside the {}x{} asset", width, height),
            )
        })
        .collect()
}

fn encode_region(r: &TargetRegion) -> String {
    format!("{},{},{},{}", r.x, r.y, r.width, r.height)
}

fn decode_region(id: String, encoded: &str) -> Result<TargetRegion, UnflattenError> {
    let bad = |id: &str| {
        UnflattenError::new(
            COL_REGIONS,
            format!("region '{}' must be x,y,width,height, got '{}'", id, encoded),
        )
    };
    let numbers = encoded
        .split(',')
        .map(|n| n.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| bad(&id))?;
    match numbers.as_slice() {
        [x, y, width, height] => Ok(TargetRegion {
            x: *x,
            y: *y,
            width: *width,
            height: *height,
            id,
        }),
        _ => Err(bad(&id)),
    }
}

fn flatten(content: &Content, opts: &FlattenOptions) -> Result<Cells, FlattenError> {
    let Some(click) = content.as_click_target() else { return Ok(Vec::new()) };
    let regions = click
        .regions
        .iter()
        .map(|r| flat::pair(&r.id, &encode_region(r)))
        .collect();
    Ok(vec![
        (COL_ASSET, click.asset.url.clone()),
        (COL_ALT, flat::encode_optional(COL_ALT, &click.asset.alt)?),
        (COL_WIDTH, flat::encode_number(click.asset.width)),
        (COL_HEIGHT, flat::encode_number(click.asset.height)),
        (COL_REGIONS, flat::join_pairs(COL_REGIONS, regions, opts)?),
    ])
}

fn unflatten(row: &CellReader<'_>) -> Result<Content, UnflattenError> {
    let regions = row
        .raw_pairs(COL_REGIONS)?
        .into_iter()
        .map(|(id, encoded)| decode_region(id, encoded))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Content::ClickTarget(ClickTargetContent {
        asset: AssetRef {
            url: row.text(COL_ASSET),
            alt: row.optional(COL_ALT),
            width: row.number(COL_WIDTH)?,
            height: row.number(COL_HEIGHT)?,
        },
        regions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::test_support::{check, rule_ids};
    use std::collections::BTreeMap;

    fn region(id: &str, x: u32, y: u32, width: u32, height: u32) -> TargetRegion {
        TargetRegion {
            id: id.to_string(),
            x,
            y,
            width,
            height,
        }
    }

    fn click(size: Option<(u32, u32)>, regions: Vec<TargetRegion>) -> Content {
        Content::ClickTarget(ClickTargetContent {
            asset: AssetRef {
                url: "https://cdn.example.com/diagram.png".to_string(),
                alt: Some("Network diagram".to_string()),
                width: size.map(|s| s.0),
                height: size.map(|s| s.1),
            },
            regions,
        })
    }

    #[test]
    fn test_well_formed() {
        assert!(check(&entry(), &click(Some((800, 600)), vec![region("router", 10, 10, 50, 40)])).is_empty());
    }

    #[test]
    fn test_no_regions_is_one_error() {
        let findings = check(&entry(), &click(None, vec![]));
        assert_eq!(rule_ids(&findings), vec!["click_target.regions_required"]);
    }

    #[test]
    fn test_bounds_only_checked_with_known_size() {
        let outside = vec![region("r", 780, 0, 50, 40)];
        let findings = check(&entry(), &click(Some((800, 600)), outside.clone()));
        assert_eq!(rule_ids(&findings), vec!["click_target.region_bounds"]);
        assert!(check(&entry(), &click(None, outside)).is_empty());
    }

    #[test]
    fn test_degenerate_and_duplicate_regions() {
        let findings = check(&entry(), &click(None, vec![region("a", 0, 0, 0, 5), region("a", 1, 1, 5, 5)]));
        assert_eq!(
            rule_ids(&findings),
            vec!["click_target.region_ids_unique", "click_target.region_size"]
        );
    }

    #[test]
    fn test_flatten_roundtrip() {
        let content = click(Some((800, 600)), vec![region("a=1", 1, 2, 3, 4), region("b", 5, 6, 7, 8)]);
        let cells = flatten(&content, &FlattenOptions::default()).unwrap();
        let row: BTreeMap<String, String> = cells.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        assert_eq!(row["click_regions"], r"a\=1=1,2,3,4|b=5,6,7,8");
        assert_eq!(unflatten(&CellReader::new(&row)).unwrap(), content);
    }

    #[test]
    fn test_malformed_region_cell() {
        let mut row = BTreeMap::new();
        row.insert("click_regions".to_string(), "a=1,2,3".to_string());
        let err = unflatten(&CellReader::new(&row)).unwrap_err();
        assert_eq!(err.column, "click_regions");
    }
}
