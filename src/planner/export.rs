//! Planner Export Module
//! Converts a finished planner into the run records the viewer reads.

use crate::data::{EnvironmentRecord, PathPoint, RunData, TreeEdge};
use crate::planner::{RrtStar, State};

impl<S: State> RrtStar<'_, S> {
    /// Snapshot of the tree, the given path and the environment as run records.
    pub fn export(&self, path: &[S]) -> RunData {
        let tree = self.tree();
        let env = self.environment();

        RunData {
            nodes: tree.nodes().iter().map(|n| n.state.position()).collect(),
            path: path
                .iter()
                .map(|s| PathPoint::new(s.position(), s.velocity()))
                .collect(),
            obstacles: env.obstacles().to_vec(),
            tree: tree
                .edges()
                .map(|(child, parent)| TreeEdge {
                    from: child.position(),
                    to: parent.position(),
                })
                .collect(),
            environment: EnvironmentRecord {
                extent: (env.width(), env.height()),
                start: tree.node(tree.root()).state.position(),
                goal: self.goal(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::{Point, Rect};
    use crate::planner::{DynamicPoint, Environment, Limits, PlannerSettings, RrtStar};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settings() -> PlannerSettings {
        PlannerSettings {
            samples: 200,
            radius: 2.0,
            step: 1.0,
            max_iterations: 10_000,
        }
    }

    #[test]
    fn export_mirrors_the_tree() {
        let mut env = Environment::new(10.0, 10.0);
        env.add_obstacle(Rect::new(4.0, 10.0, 1.0, 6.0));
        let goal = Rect::new(7.0, 3.0, 3.0, 3.0);
        let mut rng = StdRng::seed_from_u64(2);

        let mut planner =
            RrtStar::new(&env, goal, Point::new(1.0, 9.0), settings()).expect("planner");
        planner.run(&mut rng);
        let path = vec![Point::new(1.0, 9.0), Point::new(1.5, 9.0)];

        let run = planner.export(&path);
        assert_eq!(run.nodes.len(), planner.tree().len());
        assert_eq!(run.tree.len(), planner.tree().len() - 1);
        assert_eq!(run.obstacles, env.obstacles().to_vec());
        assert_eq!(run.environment.extent, (10.0, 10.0));
        assert_eq!(run.environment.start, Point::new(1.0, 9.0));
        assert_eq!(run.environment.goal, goal);
        assert!(run.path.iter().all(|p| p.velocity.is_none()));
    }

    #[test]
    fn dynamic_paths_carry_velocity() {
        let env = Environment::new(10.0, 10.0);
        let start = DynamicPoint::at_rest(Point::new(1.0, 9.0), Limits::default());
        let planner = RrtStar::new(&env, Rect::new(7.0, 3.0, 3.0, 3.0), start, settings())
            .expect("planner");

        let run = planner.export(&[start]);
        assert_eq!(run.path[0].velocity, Some((0.0, 0.0)));
        assert_eq!(run.path[0].speed(), Some(0.0));
    }
}
