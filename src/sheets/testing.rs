// Copyright 2025 Webmobix Solutions AG
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUTHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! In-memory spreadsheet backend for tests.

use crate::sheets::client::{
    CellRange, FormatDirective, SpreadsheetClient, SpreadsheetMetadata, TabInfo,
};
use anyhow::Result;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Metadata,
    AddTab,
    WriteValues,
    UpdateStructure,
}

#[derive(Default)]
struct State {
    tabs: Vec<TabInfo>,
    next_id: i32,
    calls: Vec<Operation>,
    writes: Vec<Vec<CellRange>>,
    structure_updates: Vec<Vec<FormatDirective>>,
}

pub struct FakeSpreadsheet {
    title: String,
    state: Mutex<State>,
    failing: Vec<Operation>,
}

impl FakeSpreadsheet {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            state: Mutex::new(State {
                next_id: 1000,
                ..Default::default()
            }),
            failing: Vec::new(),
        }
    }

    pub fn with_tab(self, title: &str, numeric_id: i32) -> Self {
        self.state.lock().unwrap().tabs.push(TabInfo {
            title: title.to_string(),
            numeric_id,
        });
        self
    }

    /// Makes every call of the given kind fail.
    pub fn failing_on(mut self, operation: Operation) -> Self {
        self.failing.push(operation);
        self
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, operation: Operation) -> usize {
        self.calls().into_iter().filter(|op| *op == operation).count()
    }

    pub fn tabs(&self) -> Vec<TabInfo> {
        self.state.lock().unwrap().tabs.clone()
    }

    pub fn writes(&self) -> Vec<Vec<CellRange>> {
        self.state.lock().unwrap().writes.clone()
    }

    pub fn structure_updates(&self) -> Vec<Vec<FormatDirective>> {
        self.state.lock().unwrap().structure_updates.clone()
    }

    fn record(&self, operation: Operation) -> Result<()> {
        self.state.lock().unwrap().calls.push(operation);
        if self.failing.contains(&operation) {
            anyhow::bail!("simulated backend failure during {:?}", operation);
        }
        Ok(())
    }
}

impl SpreadsheetClient for FakeSpreadsheet {
    async fn spreadsheet_metadata(&self, _spreadsheet_id: &str) -> Result<SpreadsheetMetadata> {
        self.record(Operation::Metadata)?;
        Ok(SpreadsheetMetadata {
            title: self.title.clone(),
            tabs: self.tabs(),
        })
    }

    async fn add_tab(&self, _spreadsheet_id: &str, title: &str) -> Result<i32> {
        self.record(Operation::AddTab)?;
        let mut state = self.state.lock().unwrap();
        if state.tabs.iter().any(|tab| tab.title == title) {
            anyhow::bail!("A sheet with the name \"{}\" already exists", title);
        }
        state.next_id += 1;
        let numeric_id = state.next_id;
        state.tabs.push(TabInfo {
            title: title.to_string(),
            numeric_id,
        });
        Ok(numeric_id)
    }

    async fn batch_write_values(&self, _spreadsheet_id: &str, ranges: &[CellRange]) -> Result<()> {
        self.record(Operation::WriteValues)?;
        self.state.lock().unwrap().writes.push(ranges.to_vec());
        Ok(())
    }

    async fn batch_update_structure(
        &self,
        _spreadsheet_id: &str,
        directives: &[FormatDirective],
    ) -> Result<()> {
        self.record(Operation::UpdateStructure)?;
        self.state
            .lock()
            .unwrap()
            .structure_updates
            .push(directives.to_vec());
        Ok(())
    }
}
