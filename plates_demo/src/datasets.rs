// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory datasets and their field mappings.

use std::collections::HashMap;

use plates_core::{DatasetProvider, FetchError, FieldMap, Record};

#[derive(Debug)]
struct Table {
    fields: FieldMap,
    text: &'static str,
}

/// Serves comma-separated tables compiled into the binary.
///
/// Cells are split on `,` with no quoting, so values must not contain commas.
#[derive(Debug, Default)]
pub(crate) struct InMemoryProvider {
    tables: HashMap<&'static str, Table>,
}

impl InMemoryProvider {
    pub(crate) fn with_table(mut self, name: &'static str, fields: FieldMap, text: &'static str) -> Self {
        self.tables.insert(name, Table { fields, text });
        self
    }
}

impl DatasetProvider for InMemoryProvider {
    fn load(&self, name: &str) -> Result<Vec<Record>, FetchError> {
        let table = self
            .tables
            .get(name)
            .ok_or_else(|| FetchError::NotFound(name.to_string()))?;
        let parse_error = |message: String| FetchError::Parse {
            name: name.to_string(),
            message,
        };

        let mut lines = table.text.lines().map(str::trim).filter(|l| !l.is_empty());
        let header: Vec<&str> = lines
            .next()
            .ok_or_else(|| parse_error("missing header row".to_string()))?
            .split(',')
            .map(str::trim)
            .collect();
        if let Some(m) = table
            .fields
            .mappings()
            .iter()
            .find(|m| !header.contains(&&*m.source))
        {
            return Err(parse_error(format!("missing column `{}`", m.source)));
        }

        let records: Vec<Record> = lines
            .map(|line| {
                let row: Vec<&str> = line.split(',').collect();
                table.fields.record(&header, &row)
            })
            .collect();
        log::debug!("loaded `{name}`: {} records", records.len());
        Ok(records)
    }
}

/// The datasets every demo plate binds.
pub(crate) fn provider() -> InMemoryProvider {
    InMemoryProvider::default()
        .with_table(
            "data01",
            FieldMap::new()
                .number("Year", "year")
                .number("Land Value (Dollars)", "value"),
            DATA01,
        )
        .with_table(
            "data03",
            FieldMap::new().text("County", "county").number("Acres", "acres"),
            DATA03,
        )
        .with_table(
            "data04",
            FieldMap::new().number("Year", "year").number("Acres", "value"),
            DATA04,
        )
        .with_table(
            "data05",
            FieldMap::new()
                .number("Year", "year")
                .number("Property Value (Dollars)", "value"),
            DATA05,
        )
        .with_table(
            "data07",
            FieldMap::new()
                .text("Year", "label")
                .number("Furniture Value (Dollars)", "value"),
            DATA07,
        )
        .with_table(
            "data08",
            FieldMap::new()
                .text("Occupation", "occupation")
                .number("Count", "count"),
            DATA08,
        )
        .with_table(
            "data09",
            FieldMap::new()
                .text("Group", "group")
                .text("Occupation", "occupation")
                .number("Percentage", "percentage"),
            DATA09,
        )
        .with_table(
            "data10",
            FieldMap::new()
                .text("Class", "income_class")
                .number("Actual Average", "actual_average")
                .number("Rent", "rent")
                .number("Food", "food")
                .number("Clothes", "clothes")
                .number("Tax", "tax")
                .number("Other", "other"),
            DATA10,
        )
}

const DATA01: &str = "
Year,Land Value (Dollars)
1870,
1875,5393885
1880,5764293
1885,8153390
1890,12322003
1895,12941230
1899,13447423
";

const DATA03: &str = "
County,Acres
Appling,12500
Baker,48200
Chatham,9100
Dougherty,61750
Fulton,3400
Glynn,7800
";

const DATA04: &str = "
Year,Acres
1874,338769
1875,350000
1880,586664
1885,788376
1890,967234
1895,1043847
1899,1062223
";

const DATA05: &str = "
Year,Property Value (Dollars)
1870,1250000
1875,5393885
1880,5764293
1885,8153390
1890,12322003
1899,13447423
";

const DATA07: &str = "
Year,Furniture Value (Dollars)
1875,21186
1880,498532
1885,736170
1890,1173624
1895,1322694
1899,1434975
";

const DATA08: &str = "
Occupation,Count
Farmers,62000
Laborers,28000
Servants,21500
Carpenters,2300
Barbers,700
Teachers,1200
Ministers,900
";

const DATA09: &str = "
Group,Occupation,Percentage
b,agriculture,62%
b,domestic,28%
b,manufacturing,5%
b,trade,4.5%
b,professions,0.5%
w,agriculture,64%
w,manufacturing,13.5%
w,domestic,5.5%
w,trade,13%
w,professions,4%
";

const DATA10: &str = "
Class,Actual Average,Rent,Food,Clothes,Tax,Other
$100-200,139.1,19,43,28,0.1,9.9
$200-300,249.45,22,47,23,4,4
$300-400,335.66,23,43,18,4.5,11.5
$400-500,433.82,18,37,15,5.5,24.5
$500-750,547,13,31,17,5,34
$750-1000,880,0,37,19,8,36
Over $1000,1125,0,29,16,4.5,50.5
";
