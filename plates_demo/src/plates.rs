// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The demo plates, as configuration.

use kurbo::Point;
use plates_charts::{
    Aggregation, ChoroplethSpec, Feature, GaugeSpec, LineSpec, PieGroup, PlateKind, PlateSpec,
    RingsSpec, SplitPieSpec, StackedRowsSpec, TitlePlacement, TitleSpec, ValueBarsSpec,
    WrappedBarsSpec,
};
use plates_core::Viewport;

/// A plate and the size it is drawn at.
#[derive(Debug)]
pub(crate) struct DemoPlate {
    pub(crate) name: &'static str,
    pub(crate) spec: PlateSpec,
    pub(crate) viewport: Viewport,
}

fn left_title(text: &str) -> TitleSpec {
    TitleSpec::new(text).with_uppercase(true).with_font_size(24.0)
}

fn top_title(text: &str) -> TitleSpec {
    left_title(text).with_placement(TitlePlacement::Top)
}

/// Square counties on a 3 × 2 grid, north row first.
fn counties() -> Vec<Feature> {
    ["Appling", "Baker", "Chatham", "Dougherty", "Fulton", "Glynn"]
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let x = (i % 3) as f64;
            let y = 1.0 - (i / 3) as f64;
            Feature::new(
                *name,
                vec![vec![
                    Point::new(x, y),
                    Point::new(x + 1.0, y),
                    Point::new(x + 1.0, y + 1.0),
                    Point::new(x, y + 1.0),
                ]],
            )
        })
        .collect()
}

pub(crate) fn all() -> Vec<DemoPlate> {
    let page = Viewport::new(800.0, 1000.0);
    vec![
        DemoPlate {
            name: "plate01",
            spec: PlateSpec::new(
                "data01",
                left_title("Value of land \nowned by \nGeorgia negroes"),
                PlateKind::ValueBars(ValueBarsSpec::new("year", "value")),
            ),
            viewport: page,
        },
        DemoPlate {
            name: "plate03",
            spec: PlateSpec::new(
                "data03",
                left_title("Acres of \nland \nowned by \nBlack \nGeorgians"),
                PlateKind::Choropleth(ChoroplethSpec::new(counties(), "county", "acres")),
            ),
            viewport: page,
        },
        DemoPlate {
            name: "plate04",
            spec: PlateSpec::new(
                "data04",
                left_title("Acres of \nland \nowned \n1874-1899"),
                PlateKind::Line(LineSpec::new("year", "value").with_point_radius(4.0)),
            ),
            viewport: Viewport::new(800.0, 500.0),
        },
        DemoPlate {
            name: "plate05",
            spec: PlateSpec::new(
                "data05",
                left_title("Assessed value \nof property"),
                PlateKind::Rings(RingsSpec::new("year", "value")),
            ),
            viewport: page,
        },
        DemoPlate {
            name: "plate07",
            spec: PlateSpec::new(
                "data07",
                top_title("Assessed value of household and kitchen furniture"),
                PlateKind::Gauge(GaugeSpec::new("label", "value")),
            ),
            viewport: page,
        },
        DemoPlate {
            name: "plate08",
            spec: PlateSpec::new(
                "data08",
                top_title("Occupations of negroes"),
                PlateKind::WrappedBars(
                    WrappedBarsSpec::new("occupation", "count").with_aggregation(
                        Aggregation::new("count", 1500.0, "occupation", "Others"),
                    ),
                ),
            ),
            viewport: page,
        },
        DemoPlate {
            name: "plate09",
            spec: PlateSpec::new(
                "data09",
                top_title("Occupations of negroes and whites in Georgia"),
                PlateKind::SplitPie(
                    SplitPieSpec::new("group", "occupation", "percentage")
                        .with_group(PieGroup::new("b", 210.0, 330.0).with_caption("NEGROES"))
                        .with_group(PieGroup::new("w", 30.0, 150.0).with_caption("WHITES")),
                ),
            ),
            viewport: page,
        },
        DemoPlate {
            name: "plate10",
            spec: PlateSpec::new(
                "data10",
                top_title("Income and expenditure of 150 negro families"),
                PlateKind::StackedRows(
                    StackedRowsSpec::new("income_class", ["rent", "food", "clothes", "tax", "other"])
                        .with_note("actual_average"),
                ),
            ),
            viewport: page,
        },
    ]
}
