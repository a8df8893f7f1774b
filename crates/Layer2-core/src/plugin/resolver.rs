//! Dependency Resolver - 플러그인 로드 순서 계산
//!
//! 깊이 우선 후위 순회로 위상 정렬합니다.
//! - 의존성은 선언 순서대로 방문
//! - 독립 플러그인 간 순서는 입력 순서를 따름
//! - `visiting` 집합에 있는 노드를 다시 만나면 순환

use super::descriptor::PluginDescriptor;
use std::collections::{HashMap, HashSet};
use trellis_foundation::{Error, Result};

/// 로드 순서 계산
///
/// 반환된 순서에서 모든 의존성은 의존하는 플러그인보다 앞에 옵니다.
pub fn resolve_order<'a, I>(descriptors: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a PluginDescriptor>,
{
    let descriptors: Vec<&PluginDescriptor> = descriptors.into_iter().collect();
    let by_name: HashMap<&str, &PluginDescriptor> =
        descriptors.iter().map(|d| (d.name.as_str(), *d)).collect();

    let mut walker = Walker {
        by_name,
        visited: HashSet::new(),
        visiting: HashSet::new(),
        stack: Vec::new(),
        order: Vec::with_capacity(descriptors.len()),
    };

    for descriptor in &descriptors {
        walker.visit(descriptor)?;
    }

    Ok(walker.order)
}

struct Walker<'a> {
    by_name: HashMap<&'a str, &'a PluginDescriptor>,
    visited: HashSet<&'a str>,
    visiting: HashSet<&'a str>,
    /// 현재 탐색 경로 (순환 경로 보고용)
    stack: Vec<&'a str>,
    order: Vec<String>,
}

impl<'a> Walker<'a> {
    fn visit(&mut self, descriptor: &'a PluginDescriptor) -> Result<()> {
        let name = descriptor.name.as_str();

        if self.visited.contains(name) {
            return Ok(());
        }

        if self.visiting.contains(name) {
            let start = self.stack.iter().position(|n| *n == name).unwrap_or(0);
            let mut path: Vec<String> = self.stack[start..].iter().map(|n| n.to_string()).collect();
            path.push(name.to_string());
            return Err(Error::CircularDependency {
                plugin: name.to_string(),
                path,
            });
        }

        self.visiting.insert(name);
        self.stack.push(name);

        for dependency in &descriptor.dependencies {
            let Some(dep) = self.by_name.get(dependency.as_str()).copied() else {
                return Err(Error::MissingDependency {
                    plugin: name.to_string(),
                    dependency: dependency.clone(),
                });
            };
            self.visit(dep)?;
        }

        self.stack.pop();
        self.visiting.remove(name);
        self.visited.insert(name);
        self.order.push(name.to_string());

        Ok(())
    }
}
