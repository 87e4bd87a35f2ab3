use super::tables::ALL_TABLES;
use super::types::TableSchema;
use std::collections::{HashMap, HashSet};

/// Orders tables by their foreign key dependencies
pub struct DependencyResolver {
    tables: &'static [&'static TableSchema],
    /// Map of table name -> tables it depends on
    deps: HashMap<&'static str, HashSet<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        Self::from_tables(ALL_TABLES)
    }

    /// Resolver over an arbitrary table registry, in any listing order
    pub fn from_tables(tables: &'static [&'static TableSchema]) -> Self {
        let deps = tables
            .iter()
            .map(|table| (table.name, table.dependencies()))
            .collect();

        Self { tables, deps }
    }

    /// Tables in creation order (parents before children)
    pub fn create_order(&self) -> Result<Vec<&'static TableSchema>, String> {
        self.topological_sort()
    }

    /// Tables in drop order (children before parents)
    pub fn drop_order(&self) -> Result<Vec<&'static TableSchema>, String> {
        let mut tables = self.create_order()?;
        tables.reverse();
        Ok(tables)
    }

    fn table(&self, name: &str) -> Option<&'static TableSchema> {
        self.tables.iter().find(|t| t.name == name).copied()
    }

    /// Topological sort of tables by dependencies
    fn topological_sort(&self) -> Result<Vec<&'static TableSchema>, String> {
        let mut result = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut temp_visited: HashSet<&str> = HashSet::new();

        // Walk in registry order so the output is deterministic
        for table in self.tables {
            if !visited.contains(table.name) {
                self.visit(table.name, &mut visited, &mut temp_visited, &mut result)?;
            }
        }

        Ok(result)
    }

    fn visit(
        &self,
        name: &'static str,
        visited: &mut HashSet<&'static str>,
        temp_visited: &mut HashSet<&'static str>,
        result: &mut Vec<&'static TableSchema>,
    ) -> Result<(), String> {
        if temp_visited.contains(name) {
            return Err(format!("Circular dependency detected at: {}", name));
        }
        if visited.contains(name) {
            return Ok(());
        }

        let table = self
            .table(name)
            .ok_or_else(|| format!("Unknown table referenced: {}", name))?;

        temp_visited.insert(name);

        if let Some(deps) = self.deps.get(name) {
            // Sorted so that sibling parents come out in a stable order
            let mut deps: Vec<_> = deps.iter().copied().filter(|dep| *dep != name).collect();
            deps.sort_unstable();
            for dep in deps {
                self.visit(dep, visited, temp_visited, result)?;
            }
        }

        temp_visited.remove(name);
        visited.insert(name);
        result.push(table);

        Ok(())
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}
