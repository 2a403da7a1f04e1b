//! Route-template table and request matcher for Switchboard
//!
//! Routes are registered as `METHOD` plus a path template whose segments are
//! either literals or `:name` parameters. Matching happens in two phases:
//!
//! 1. An exact lookup of `"METHOD path"` against the literal routes. A
//!    literal route therefore always wins over a template that would also
//!    match the same path.
//! 2. A scan of the templated routes in registration order. A candidate must
//!    have the same method and the same number of path segments; literal
//!    segments must match exactly and parameter segments bind whatever the
//!    request supplied. The first template that matches every segment is
//!    selected.
//!
//! Paths are never normalized: a trailing slash produces a different segment
//! list and only matches a route registered with that trailing slash. A path
//! containing an empty segment (a double slash) is rejected outright unless
//! it hits a literal route, so parameters never bind empty strings.

use std::collections::HashMap;

/// A single segment of a route template
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A registered route
#[derive(Debug)]
struct Route<H> {
    method: String,
    segments: Vec<Segment>,
    handler: H,
}

/// Named path parameters extracted from a matched route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    /// Look up a parameter by its template name (without the `:` marker)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The result of a successful route lookup
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    pub handler: &'a H,
    pub params: PathParams,
}

/// Ordered table of registered routes
#[derive(Debug)]
pub struct RouteTable<H> {
    /// `"METHOD path"` → route index, for routes without parameters
    literal: HashMap<String, usize>,
    /// Indexes of parameterized routes, in registration order
    templated: Vec<usize>,
    routes: Vec<Route<H>>,
}

impl<H> Default for RouteTable<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouteTable<H> {
    pub fn new() -> Self {
        Self {
            literal: HashMap::new(),
            templated: Vec::new(),
            routes: Vec::new(),
        }
    }

    /// Register a route template for a method. Later registrations never
    /// shadow earlier ones: among templates, the first match in registration
    /// order wins.
    pub fn register(&mut self, method: &str, template: &str, handler: H) {
        let segments: Vec<Segment> = template
            .split('/')
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();

        let index = self.routes.len();
        let has_params = segments.iter().any(|s| matches!(s, Segment::Param(_)));

        self.routes.push(Route {
            method: method.to_string(),
            segments,
            handler,
        });

        if has_params {
            self.templated.push(index);
        } else {
            self.literal
                .insert(format!("{} {}", method, template), index);
        }
    }

    /// Find the route matching `method` and `path`, extracting any named
    /// parameters. `path` must not include a query string.
    pub fn lookup(&self, method: &str, path: &str) -> Option<RouteMatch<'_, H>> {
        // Phase 1: exact literal match.
        if let Some(&index) = self.literal.get(&format!("{} {}", method, path)) {
            return Some(RouteMatch {
                handler: &self.routes[index].handler,
                params: PathParams::default(),
            });
        }

        let request_segments: Vec<&str> = path.split('/').collect();

        // A double slash (or trailing slash) yields an empty segment, which
        // no parameter may bind; such paths only ever match literally.
        if request_segments.iter().skip(1).any(|s| s.is_empty()) {
            return None;
        }

        // Phase 2: scan templates in registration order.
        'candidates: for &index in &self.templated {
            let route = &self.routes[index];
            if route.method != method || route.segments.len() != request_segments.len() {
                continue;
            }

            let mut params = HashMap::new();
            for (segment, supplied) in route.segments.iter().zip(&request_segments) {
                match segment {
                    Segment::Literal(literal) => {
                        if literal != supplied {
                            continue 'candidates;
                        }
                    }
                    Segment::Param(name) => {
                        params.insert(name.clone(), (*supplied).to_string());
                    }
                }
            }

            return Some(RouteMatch {
                handler: &route.handler,
                params: PathParams(params),
            });
        }

        None
    }
}
